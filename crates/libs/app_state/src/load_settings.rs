use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::fs;
use std::path::Path;

/// Loads settings from `config/settings.yaml`, with `APP__*` environment
/// variables (and a local `.env`) overriding individual keys. The yaml ships
/// empty secret values; real credentials come from the environment.
pub fn load_app_settings() -> Result<AppSettings> {
    dotenv::from_path(".env").ok();
    let config_path = Path::new("config/settings.yaml").canonicalize()?;

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    let settings: AppSettings = raw_settings.into();

    if let Some(store_dir) = settings.likes.store_file.parent() {
        fs::create_dir_all(store_dir)?;
    }

    Ok(settings)
}
