use super::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "User and friendship HTTP service")]
pub struct Cli {
    /// Settings file; defaults to settings/dev.toml (debug) or settings/release.toml.
    #[arg(long, env = "FRIENDS_SETTINGS")]
    pub settings: Option<String>,

    /// Overrides `repo.backend` ("postgres" or "memory").
    #[arg(long)]
    pub backend: Option<String>,

    /// Overrides `http.address`.
    #[arg(long)]
    pub address: Option<String>,
}

impl Cli {
    pub fn apply(&self, settings: &mut super::Settings) {
        if let Some(backend) = &self.backend {
            settings.repo.backend = backend.clone();
        }
        if let Some(address) = &self.address {
            settings.http.address = address.clone();
        }
    }
}
