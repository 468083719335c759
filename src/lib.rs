//! quizdeck library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod tui;
pub mod tutor;

#[cfg(test)]
pub mod test_support;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    #[default]
    OpenRouter,
    LmStudio,
}

impl Provider {
    /// The name used in config files and `QUIZDECK_PROVIDER`.
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::LmStudio => "lmstudio",
        }
    }
}
