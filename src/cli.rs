use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "taskd", about = "Task tracking HTTP service")]
pub struct Cli {
    /// Directory holding the SQLite database [default: ~/.taskd]
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    /// Database file name, or `:memory:` for a throwaway store
    #[arg(long, env = "DB_NAME", default_value = "taskd.db")]
    pub db_name: String,

    /// Address to listen on
    #[arg(long, env = "HTTP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "HTTP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Origins allowed by CORS, comma separated
    #[arg(
        long,
        env = "CORS_ORIGIN",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub cors_origin: Vec<String>,
}

impl Cli {
    /// Full path of the database file. `:memory:` passes through untouched.
    pub fn db_path(&self) -> Result<String> {
        if self.db_name == ":memory:" {
            return Ok(self.db_name.clone());
        }
        let dir = match &self.db_host {
            Some(d) => PathBuf::from(d),
            None => {
                let home = std::env::var("HOME").context("HOME environment variable not set")?;
                PathBuf::from(home).join(".taskd")
            }
        };
        Ok(dir
            .join(&self.db_name)
            .to_str()
            .context("database path is not valid UTF-8")?
            .to_string())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
