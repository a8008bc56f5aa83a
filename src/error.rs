use thiserror::Error;

/// Structured error context attached to serialization and configuration failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Batch verb or request kind that failed (e.g., "index", "delete", "search")
    pub action: Option<String>,
    /// Request path of the failing operation (e.g., "foo/bar/123")
    pub path: Option<String>,
    /// Zero-based position of the failing member inside a batch
    pub position: Option<usize>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// Unified error type for request construction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Payload serialization error: {source}{}", format_context(.context))]
    PayloadSerialization {
        source: serde_json::Error,
        context: ErrorContext,
    },

    #[error("Header serialization error: {source}{}", format_context(.context))]
    HeaderSerialization {
        source: serde_json::Error,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Invalid batch plan: {message}{}", format_context(.context))]
    Plan {
        message: String,
        context: ErrorContext,
    },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Transport error: {message}")]
    Transport { message: String },
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref action) = ctx.action {
        parts.push(format!("action: {}", action));
    }
    if let Some(ref path) = ctx.path {
        parts.push(format!("path: {}", path));
    }
    if let Some(position) = ctx.position {
        parts.push(format!("position: {}", position));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn payload(source: serde_json::Error, context: ErrorContext) -> Self {
        Error::PayloadSerialization { source, context }
    }

    pub fn header(source: serde_json::Error, context: ErrorContext) -> Self {
        Error::HeaderSerialization { source, context }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn plan_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Plan {
            message: msg.into(),
            context,
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport {
            message: msg.into(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::PayloadSerialization { context, .. }
            | Error::HeaderSerialization { context, .. }
            | Error::Configuration { context, .. }
            | Error::Plan { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Record the batch position of the member that produced this error.
    pub fn at_position(mut self, position: usize) -> Self {
        match &mut self {
            Error::PayloadSerialization { context, .. }
            | Error::HeaderSerialization { context, .. }
            | Error::Configuration { context, .. }
            | Error::Plan { context, .. } => context.position = Some(position),
            _ => (),
        }
        self
    }

    /// True for failures that come from rendering a payload or header, as opposed to the sink.
    pub fn is_serialization(&self) -> bool {
        matches!(
            self,
            Error::PayloadSerialization { .. } | Error::HeaderSerialization { .. }
        )
    }
}
