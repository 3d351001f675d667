use gettextrs::{LocaleCategory, bind_textdomain_codeset, setlocale, textdomain};
use tessera::puzzle::PuzzleConfig;
use tracing::warn;

const GETTEXT_PACKAGE: &str = "tessera";

fn main() -> glib::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tessera=info".into()),
        )
        .init();

    setlocale(LocaleCategory::LcAll, "");
    if let Err(err) = textdomain(GETTEXT_PACKAGE) {
        warn!(%err, "translations unavailable");
    } else if let Err(err) = bind_textdomain_codeset(GETTEXT_PACKAGE, "UTF-8") {
        warn!(%err, "could not select UTF-8 translations");
    }

    let config = match PuzzleConfig::load() {
        Ok(config) => config,
        Err(err) => {
            warn!(%err, "using the default puzzle config");
            PuzzleConfig::default()
        }
    };

    tessera::ui::run(config)
}
