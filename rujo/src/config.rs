use std::env;

const DEFAULT_CC: &str = "cc";
const DEFAULT_CFLAGS: &str = "-std=c11";

/// Native toolchain settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// C compiler command.
    pub cc: String,
    /// Extra flags passed to [`Config::cc`] before the input file.
    pub cflags: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cc: DEFAULT_CC.to_string(),
            cflags: split_flags(DEFAULT_CFLAGS),
        }
    }
}

impl Config {
    /// Reads `RUJO_CC` (falling back to `CC`) and `RUJO_CFLAGS`. Empty variables count as unset.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());
        let default = Self::default();

        let cc = var("RUJO_CC")
            .or_else(|| var("CC"))
            .map(|cc| cc.trim().to_string())
            .unwrap_or(default.cc);
        let cflags = var("RUJO_CFLAGS")
            .map(|flags| split_flags(&flags))
            .unwrap_or(default.cflags);

        let config = Self { cc, cflags };
        log::debug!("toolchain config: {:?}", config);
        config
    }
}

fn split_flags(flags: &str) -> Vec<String> {
    flags.split_whitespace().map(str::to_string).collect()
}
