use grizabella::config::ConfigBuilder;
use grizabella::prelude::*;

pub struct GrizabellaCliContext {
    pub db: Grizabella,
}

impl GrizabellaCliContext {
    pub async fn new(data_dir: Option<String>) -> Result<Self> {
        let db = if let Some(dir) = data_dir {
            let config = ConfigBuilder::new().with_data_dir(dir).build()?;
            grizabella::init(config).await?
        } else {
            grizabella::init_with_defaults().await?
        };
        Ok(Self { db })
    }
}
