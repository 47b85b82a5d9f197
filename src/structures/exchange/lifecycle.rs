use std::time::Instant;

use tracing::warn;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RequestType {
    Route,
    Board,
    Multiboard,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Route => "route",
            RequestType::Board => "board",
            RequestType::Multiboard => "multiboard",
        }
    }
}

/// Pending → failed | resolved bookkeeping shared by requests and responses.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    created: Instant,
    error: Option<String>,
    elapsed: Option<f64>,
    transitions: u32,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::new()
    }
}

impl Lifecycle {
    pub fn new() -> Lifecycle {
        Lifecycle {
            created: Instant::now(),
            error: None,
            elapsed: None,
            transitions: 0,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Seconds between construction and settlement.
    pub fn elapsed(&self) -> Option<f64> {
        self.elapsed
    }

    pub fn is_settled(&self) -> bool {
        self.transitions > 0
    }

    /// Number of `fail`/`resolve` calls so far. Anything above one is a
    /// caller bug; the later call still wins.
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    pub fn fail(&mut self, kind: RequestType, error: String) {
        self.settle(kind, "fail");
        self.error = Some(error);
    }

    pub fn resolve(&mut self, kind: RequestType, error: Option<String>) {
        self.settle(kind, "resolve");
        self.error = error;
    }

    fn settle(&mut self, kind: RequestType, how: &str) {
        if self.transitions > 0 {
            warn!(
                "{} {how} called on an already settled exchange (previous error: {:?})",
                kind.as_str(),
                self.error
            );
        }
        self.transitions += 1;
        self.elapsed = Some(self.created.elapsed().as_secs_f64());
    }
}

/// Common surface of every request and response.
pub trait Exchange {
    fn request_type(&self) -> RequestType;
    fn lifecycle(&self) -> &Lifecycle;
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    fn error(&self) -> Option<&str> {
        self.lifecycle().error()
    }

    fn elapsed(&self) -> Option<f64> {
        self.lifecycle().elapsed()
    }

    fn is_settled(&self) -> bool {
        self.lifecycle().is_settled()
    }

    fn fail(&mut self, error: impl Into<String>)
    where
        Self: Sized,
    {
        let kind = self.request_type();
        self.lifecycle_mut().fail(kind, error.into());
    }
}
