// Adding the context method to errors:
use eyre::WrapErr;
use color_eyre::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
  pub db_path: String,
  pub schema_path: String,
}

impl Config {

  pub fn from_env() -> Result<Config> {
    let mut c = config::Config::new();
    // You have to use lowercase here when compared to
    // what's in the .env file.
    c.set_default("db_path", "database/reasonpath.db")?;
    // The schema definition lives outside the binary so it
    // can be tweaked without recompiling. A missing file is
    // tolerated at startup (see ArticleRepository).
    c.set_default("schema_path", "resources/schema.sql")?;

    c.merge(config::Environment::default())?;
    // The error has to be given a context for
    // color_eyre to work here:
    c.try_into()
      .context("Loading configuration from env")
  }

}
