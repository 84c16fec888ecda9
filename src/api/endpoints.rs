use std::fmt;
use std::str::FromStr;

/// The fixed JSON endpoints the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CurrentRebalancing,
    Quote,
    RebalancingHistory,
    Ranking,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::CurrentRebalancing => "/cubes/rebalancing/current.json",
            Endpoint::Quote => "/cubes/quote.json",
            Endpoint::RebalancingHistory => "/cubes/rebalancing/history.json",
            Endpoint::Ranking => "/cubes/discover/rank/cube/list.json",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::CurrentRebalancing => "current_rebalancing",
            Endpoint::Quote => "quote",
            Endpoint::RebalancingHistory => "rebalancing_history",
            Endpoint::Ranking => "ranking",
        };
        f.write_str(name)
    }
}

/// Leaderboard categories. Only `Annual` is known to be served upstream;
/// the others are passed through and whatever error comes back surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingCategory {
    Daily,
    Weekly,
    Monthly,
    Annual,
    Total,
}

impl RankingCategory {
    pub fn code(&self) -> u32 {
        match self {
            RankingCategory::Daily => 11,
            RankingCategory::Weekly => 12,
            RankingCategory::Monthly => 13,
            RankingCategory::Annual => 14,
            RankingCategory::Total => 15,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RankingCategory::Daily => "日收益榜",
            RankingCategory::Weekly => "周收益榜",
            RankingCategory::Monthly => "月收益榜",
            RankingCategory::Annual => "年收益榜",
            RankingCategory::Total => "总收益榜",
        }
    }
}

impl FromStr for RankingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(RankingCategory::Daily),
            "weekly" => Ok(RankingCategory::Weekly),
            "monthly" => Ok(RankingCategory::Monthly),
            "annual" => Ok(RankingCategory::Annual),
            "total" => Ok(RankingCategory::Total),
            other => Err(format!(
                "unknown ranking category '{other}' (expected daily, weekly, monthly, annual or total)"
            )),
        }
    }
}

impl fmt::Display for RankingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RankingCategory::Daily => "daily",
            RankingCategory::Weekly => "weekly",
            RankingCategory::Monthly => "monthly",
            RankingCategory::Annual => "annual",
            RankingCategory::Total => "total",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes() {
        let codes: Vec<u32> = ["daily", "weekly", "monthly", "annual", "total"]
            .iter()
            .map(|s| s.parse::<RankingCategory>().unwrap().code())
            .collect();
        assert_eq!(codes, vec![11, 12, 13, 14, 15]);
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!("yearly".parse::<RankingCategory>().is_err());
    }

    #[test]
    fn category_display_parses_back() {
        let category = RankingCategory::Annual;
        assert_eq!(category.to_string().parse::<RankingCategory>(), Ok(category));
    }
}
