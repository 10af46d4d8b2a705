use anyhow::{Result, bail};

use crate::logic::GameplayStrategy;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse `--strategies`; `all` expands to every built-in strategy.
pub fn resolve_strategies(tokens: &[String]) -> Result<Vec<GameplayStrategy>> {
    let mut strategies = Vec::new();
    for token in tokens {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(GameplayStrategy::ALL);
            continue;
        }
        let Some(strategy) = GameplayStrategy::from_key(token) else {
            bail!("Unknown strategy: {token}");
        };
        strategies.push(strategy);
    }
    strategies.sort_unstable();
    strategies.dedup();
    if strategies.is_empty() {
        strategies.extend(GameplayStrategy::ALL);
    }
    Ok(strategies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn strategies_expand_and_dedupe() {
        let parsed = resolve_strategies(&split_csv("gambler,all,Saver")).unwrap();
        assert_eq!(parsed, GameplayStrategy::ALL.to_vec());
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let err = resolve_strategies(&split_csv("saver,yolo")).unwrap_err();
        assert!(err.to_string().contains("yolo"));
    }
}
