/// Raw token that turns on the static IP service. Matched as a whole string.
pub const STATIC_IP_ENABLED_TOKEN: &str = "static_ip_enabled:true";

/// Argument key carrying the appliance image URL
pub const AVI_CONTROLLER_OVF_URL: &str = "avi_controller_ovf_url";

/// Options parsed from the raw `key:value` testbed arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub static_ip_enabled: bool,
    pub avi_controller_ovf_url: Option<String>,
}

impl Options {
    /// Appliance image URL, empty when none was supplied
    pub fn ovf_url(&self) -> &str {
        self.avi_controller_ovf_url.as_deref().unwrap_or_default()
    }
}

/// Split a token at its first colon. The value keeps any inner colons;
/// trailing ones are dropped.
pub fn split_token(token: &str) -> (&str, &str) {
    let (key, value) = token.split_once(':').unwrap_or((token, ""));
    (key, value.trim_end_matches(':'))
}

/// Parse raw testbed arguments. Nothing here fails: unknown keys and
/// malformed tokens are skipped. `accepts_ovf_url` selects whether the
/// appliance image key is recognized, and with it the argument echo.
pub fn parse<S: AsRef<str>>(raw: &[S], accepts_ovf_url: bool) -> Options {
    let mut opts = Options {
        static_ip_enabled: raw
            .iter()
            .any(|token| token.as_ref() == STATIC_IP_ENABLED_TOKEN),
        ..Options::default()
    };

    for token in raw.iter().map(AsRef::as_ref) {
        let (key, value) = split_token(token);
        match key {
            AVI_CONTROLLER_OVF_URL if accepts_ovf_url => {
                opts.avi_controller_ovf_url = Some(value.to_string());
            }
            "static_ip_enabled" => {}
            _ => tracing::debug!("Ignoring testbed argument {:?}", token),
        }
    }

    if accepts_ovf_url {
        tracing::info!("Args: {}: {}", AVI_CONTROLLER_OVF_URL, opts.ovf_url());
    }

    opts
}
