//! Client configuration.

mod settings;

pub use settings::{
    EndpointConfig, FramingConfig, LimitsConfig, Settings, DEFAULT_STIM_PORT, MAX_MESSAGE_SIZE,
    STIM_INET_ADDRESS,
};
