use std::path::PathBuf;

use derive_builder::Builder;

use crate::launch::Invocation;

/// Create a new builder. Finish by calling `.build()`
pub fn builder() -> LauncherConfigBuilder {
    Default::default()
}

/// Where the binary comes from, where it goes, and how it is started.
///
/// Every field has a default matching the stock code-server setup, so
/// `builder().build()` gives a working configuration. Building fails if the
/// install directory is relative, or left to default and there is no home
/// directory to put it under.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct LauncherConfig {
    /// The bucket URL. Serves the listing at its root and each artifact at
    /// `base_url + key`.
    #[builder(setter(into), default = "\"https://codesrv-ci.cdr.sh/\".to_string()")]
    base_url: String,
    /// The key of the artifact in the listing.
    #[builder(setter(into), default = "\"latest-linux\".to_string()")]
    artifact_key: String,
    /// The directory the binary is installed to.
    #[builder(setter(into), default = "default_bin_dir()")]
    bin_dir: PathBuf,
    /// The file name of the installed binary.
    #[builder(setter(into), default = "\"code-server-linux\".to_string()")]
    bin_name: String,
    /// The port the server listens on.
    #[builder(default = "1337")]
    port: u16,
    /// The address the server binds to.
    #[builder(setter(into), default = "\"0.0.0.0\".to_string()")]
    host: String,
    /// The command used to open the browser.
    #[builder(setter(into), default = "\"www-browser\".to_string()")]
    browser: String,
    /// The host name the browser is pointed at.
    #[builder(setter(into), default = "\"penguin.linux.test\".to_string()")]
    browser_host: String,
    /// Mode bits for the binary directory and the binary itself.
    #[builder(default = "0o770")]
    permissions: u32,
}

const BIN_DIR_UNDER_HOME: &str = ".local/share/code-server/bin";

// Only reached after `validate` has seen a home directory.
fn default_bin_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(BIN_DIR_UNDER_HOME)
}

impl LauncherConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.bin_dir {
            Some(dir) if dir.is_relative() => Err(format!(
                "bin_dir must be an absolute path, got `{}`",
                dir.display()
            )),
            Some(_) => Ok(()),
            None if dirs::home_dir().is_none() => Err(
                "no home directory found to install under; set bin_dir explicitly".to_string(),
            ),
            None => Ok(()),
        }
    }
}

impl LauncherConfig {
    /// The listing URL.
    pub fn listing_url(&self) -> &str {
        &self.base_url
    }
    /// The key looked up in the listing.
    pub fn artifact_key(&self) -> &str {
        &self.artifact_key
    }
    /// Where the artifact is downloaded from.
    pub fn artifact_url(&self) -> String {
        format!("{}{}", self.base_url, self.artifact_key)
    }
    /// Full path of the installed binary.
    pub fn bin_path(&self) -> PathBuf {
        self.bin_dir.join(&self.bin_name)
    }
    /// The server port.
    pub fn port(&self) -> u16 {
        self.port
    }
    /// Mode bits applied to the install directory and binary.
    pub fn permissions(&self) -> u32 {
        self.permissions
    }
    /// The URL opened in the browser.
    pub fn browser_url(&self) -> String {
        format!("http://{}:{}", self.browser_host, self.port)
    }
    /// How the installed server is started.
    pub fn server_invocation(&self) -> Invocation {
        Invocation::new(self.bin_path()).args([
            "--host".to_string(),
            self.host.clone(),
            "--allow-http".to_string(),
            "--no-auth".to_string(),
            format!("--port={}", self.port),
        ])
    }
    /// How the browser is opened.
    pub fn browser_invocation(&self) -> Invocation {
        Invocation::new(&self.browser).args(["--url".to_string(), self.browser_url()])
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn defaults_match_stock_setup() {
        let config = builder().bin_dir("/opt/cs").build().unwrap();

        assert_eq!(config.listing_url(), "https://codesrv-ci.cdr.sh/");
        assert_eq!(config.artifact_url(), "https://codesrv-ci.cdr.sh/latest-linux");
        assert_eq!(config.bin_path(), PathBuf::from("/opt/cs/code-server-linux"));
        assert_eq!(config.port(), 1337);
        assert_eq!(config.permissions(), 0o770);
        assert_eq!(config.browser_url(), "http://penguin.linux.test:1337");
    }

    #[test]
    fn default_bin_dir_is_under_home() {
        let Some(home) = dirs::home_dir() else {
            assert!(builder().build().is_err());
            return;
        };
        let config = builder().build().unwrap();

        assert_eq!(
            config.bin_path(),
            home.join(BIN_DIR_UNDER_HOME).join("code-server-linux")
        );
        assert!(config.bin_path().is_absolute());
    }

    #[test]
    fn relative_bin_dir_is_rejected() {
        let err = builder().bin_dir("code-server/bin").build().unwrap_err();

        assert!(matches!(
            err,
            LauncherConfigBuilderError::ValidationError(ref msg) if msg.contains("absolute")
        ));
    }

    #[test]
    fn server_flags_follow_port() {
        let config = builder().bin_dir("/opt/cs").port(8080).build().unwrap();
        let server = config.server_invocation();

        assert_eq!(server.program(), Path::new("/opt/cs/code-server-linux"));
        assert_eq!(
            server.arguments(),
            ["--host", "0.0.0.0", "--allow-http", "--no-auth", "--port=8080"]
        );

        let browser = config.browser_invocation();
        assert_eq!(browser.program(), Path::new("www-browser"));
        assert_eq!(browser.arguments(), ["--url", "http://penguin.linux.test:8080"]);
    }
}
