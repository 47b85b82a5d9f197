use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RoutingError {
    #[error("Invalid coordinate '{0}'")]
    InvalidCoordinate(String),
    #[error("Unknown location '{0}'")]
    UnknownLocation(String),
    #[error("Missing {0}")]
    MissingInput(&'static str),
    #[error("Router unavailable: {0}")]
    RouterUnavailable(String),
    #[error("{0} requests are not implemented by this router")]
    Unimplemented(&'static str),
    #[error("{router}: {message}")]
    Vendor { router: String, message: String },
    #[error("{router} panicked: {message}")]
    ChildPanicked { router: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_location() {
        let err = RoutingError::UnknownLocation("nowhere".into());
        assert_eq!(err.to_string(), "Unknown location 'nowhere'");
    }

    #[test]
    fn display_unimplemented() {
        assert_eq!(
            RoutingError::Unimplemented("multiboard").to_string(),
            "multiboard requests are not implemented by this router"
        );
    }

    #[test]
    fn display_vendor() {
        let err = RoutingError::Vendor {
            router: "here".into(),
            message: "HTTP error: 403".into(),
        };
        assert_eq!(err.to_string(), "here: HTTP error: 403");
    }
}
