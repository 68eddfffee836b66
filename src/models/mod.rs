pub mod app_config;
pub mod recognized_text;

pub use app_config::AppConfig;
pub use recognized_text::RecognizedText;
