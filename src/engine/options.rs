/// Configuration options for the engine
use crate::ai::{LogLevel, MAX_TURNS};

use anyhow::{bail, ensure, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Turn after which battles and rollouts count as draws
    pub turn_cap: u32,
    /// Fixed seed for new battles and tournaments, random when unset
    pub seed: Option<u64>,
    /// Detail of the search traces reported by `go` and written to battle logs
    pub log_level: LogLevel,
    /// Whether a failed command terminates the process
    pub strict_mode: bool,
    /// Tournament worker threads, 0 for one per CPU
    pub threads: usize,
}

impl EngineOptions {
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "turncap" => {
                let cap: u32 = value.parse().context("invalid turn cap")?;
                ensure!(cap > 0, "turn cap must be positive");
                self.turn_cap = cap;
            }
            "seed" => {
                self.seed = match value {
                    "random" => None,
                    v => Some(v.parse().context("invalid seed")?),
                }
            }
            "loglevel" => self.log_level = value.parse()?,
            "strictmode" => self.strict_mode = value.parse().context("invalid strict mode")?,
            "threads" => self.threads = value.parse().context("invalid thread count")?,
            _ => bail!("Unknown option: {}", name),
        }

        Ok(())
    }

    /// `option` lines announced on the handshake
    pub fn describe() -> Vec<String> {
        vec![
            format!("option name turncap type spin default {} min 1", MAX_TURNS),
            "option name seed type string default random".to_string(),
            "option name loglevel type spin default 0 min 0 max 2".to_string(),
            "option name strictmode type check default true".to_string(),
            "option name threads type spin default 0 min 0".to_string(),
        ]
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            turn_cap: MAX_TURNS,
            seed: None,
            log_level: LogLevel::Disabled,
            strict_mode: true,
            threads: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_set_options() {
        let mut options = EngineOptions::default();
        options.set_option("turncap", "40").unwrap();
        options.set_option("seed", "12").unwrap();
        options.set_option("loglevel", "2").unwrap();
        options.set_option("strictmode", "false").unwrap();
        options.set_option("threads", "3").unwrap();

        assert_eq!(
            options,
            EngineOptions {
                turn_cap: 40,
                seed: Some(12),
                log_level: LogLevel::Verbose,
                strict_mode: false,
                threads: 3,
            }
        );

        options.set_option("seed", "random").unwrap();
        assert_eq!(options.seed, None);
    }

    #[test_case("turncap", "0")]
    #[test_case("turncap", "many")]
    #[test_case("seed", "-1")]
    #[test_case("loglevel", "3")]
    #[test_case("strictmode", "yes")]
    #[test_case("spells", "true")]
    fn test_rejects(name: &str, value: &str) {
        assert!(EngineOptions::default().set_option(name, value).is_err());
    }
}
