//! Error types for matrix construction and reconfiguration.
//!
//! Only construction and `prepare` inputs can fail. The processing path has
//! no error type: it cannot fail by construction.

/// Errors raised while instantiating a single module.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleError {
    /// The module type tag is not known to the factory.
    UnknownType(String),
    /// A parameter is not accepted by the module.
    InvalidParameter {
        /// Module type tag.
        module_type: String,
        /// Parameter name.
        param: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl std::fmt::Display for ModuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownType(tag) => write!(f, "unknown module type '{tag}'"),
            Self::InvalidParameter {
                module_type,
                param,
                reason,
            } => write!(
                f,
                "invalid parameter '{param}' for module '{module_type}': {reason}"
            ),
        }
    }
}

impl std::error::Error for ModuleError {}

/// Malformed channel routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// An input route targets a channel the track does not have.
    InputChannelOutOfRange {
        /// Track name.
        track: String,
        /// Requested track channel.
        channel: usize,
        /// Number of channels of the track.
        channels: usize,
    },
    /// An output route reads a channel the track does not have.
    OutputChannelOutOfRange {
        /// Track name.
        track: String,
        /// Requested track channel.
        channel: usize,
        /// Number of channels of the track.
        channels: usize,
    },
    /// Host input indices must be contiguous from zero; this one is never referenced.
    MissingHostInput(usize),
    /// An output route names an empty port.
    EmptyPortName {
        /// Track name.
        track: String,
    },
}

impl std::fmt::Display for RoutingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputChannelOutOfRange {
                track,
                channel,
                channels,
            } => write!(
                f,
                "track '{track}': input route targets channel {channel}, track has {channels}"
            ),
            Self::OutputChannelOutOfRange {
                track,
                channel,
                channels,
            } => write!(
                f,
                "track '{track}': output route reads channel {channel}, track has {channels}"
            ),
            Self::MissingHostInput(index) => write!(
                f,
                "host input {index} is never routed (host inputs must be numbered from 0 without gaps)"
            ),
            Self::EmptyPortName { track } => {
                write!(f, "track '{track}': output route has an empty port name")
            }
        }
    }
}

impl std::error::Error for RoutingError {}

/// Errors that can occur while building or reconfiguring an [`AudioMatrix`](crate::AudioMatrix).
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Host block size must be greater than zero.
    InvalidBlockSize(usize),
    /// Host sample rate must be greater than zero.
    InvalidSampleRate(u32),
    /// A track was configured with zero channels.
    NoChannels {
        /// Track name.
        track: String,
    },
    /// A module of a track could not be created.
    Module {
        /// Track name.
        track: String,
        /// Underlying module error.
        source: ModuleError,
    },
    /// The routing map is malformed.
    Routing(RoutingError),
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBlockSize(n) => write!(f, "invalid block size {n} (must be > 0)"),
            Self::InvalidSampleRate(n) => write!(f, "invalid sample rate {n} (must be > 0)"),
            Self::NoChannels { track } => write!(f, "track '{track}' has no channels"),
            Self::Module { track, source } => write!(f, "track '{track}': {source}"),
            Self::Routing(err) => write!(f, "routing: {err}"),
        }
    }
}

impl std::error::Error for MatrixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Module { source, .. } => Some(source),
            Self::Routing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RoutingError> for MatrixError {
    fn from(err: RoutingError) -> Self {
        Self::Routing(err)
    }
}
