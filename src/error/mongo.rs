use std::fmt;

/// Structured error information extracted from MongoDB driver errors.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub(crate) error_type: Option<String>,
    pub(crate) code: Option<i32>,
    pub(crate) name: Option<String>,
    pub(crate) message: Option<String>,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let error_type = self.error_type.as_deref().unwrap_or("mongo.error");
        let message = self.message.as_deref().unwrap_or("unknown error");
        write!(f, "[{error_type}] {message}")?;

        match (&self.name, self.code) {
            (Some(name), Some(code)) => write!(f, " ({name}, code {code})"),
            (None, Some(code)) => write!(f, " (code {code})"),
            _ => Ok(()),
        }
    }
}

/// Format MongoDB error messages in a single line.
///
/// Used by the parent module's `Display` implementation for
/// `ExporterError::MongoDb`.
pub fn format_mongodb_error(
    f: &mut fmt::Formatter<'_>,
    error: &mongodb::error::Error,
) -> fmt::Result {
    write!(f, "MongoDB error: {}", extract_error_info(error))
}

/// Extract structured information from a MongoDB error using the driver API.
///
/// An exporter only reads, so the interesting kinds are command failures,
/// authentication, and server selection (unreachable cluster).
pub fn extract_error_info(error: &mongodb::error::Error) -> ErrorInfo {
    use mongodb::error::ErrorKind;

    let mut info = ErrorInfo::default();

    match error.kind.as_ref() {
        ErrorKind::Command(command_error) => {
            info.error_type = Some("mongo.command_error".to_string());
            info.code = Some(command_error.code);
            info.message = Some(command_error.message.clone());
            info.name = get_error_name(command_error.code);
        }
        ErrorKind::Authentication { message, .. } => {
            info.error_type = Some("mongo.authentication_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::InvalidArgument { message, .. } => {
            info.error_type = Some("mongo.invalid_argument".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::ServerSelection { message, .. } => {
            info.error_type = Some("mongo.server_selection_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::Io(io_error) => {
            info.error_type = Some("mongo.io_error".to_string());
            info.message = Some(io_error.to_string());
        }
        _ => {
            info.message = Some(error.to_string());
        }
    }

    info
}

/// Get a human-readable error name from a MongoDB error code.
fn get_error_name(code: i32) -> Option<String> {
    let name = match code {
        13 => "Unauthorized",
        18 => "AuthenticationFailed",
        26 => "NamespaceNotFound",
        50 => "MaxTimeMSExpired",
        8000 => "AtlasError",
        _ => return None,
    };

    Some(name.to_string())
}
