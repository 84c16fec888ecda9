// Fixed-width text tables for terminal output
use std::fmt::{self, Write};

use crate::api::types::{PortfolioSnapshot, RankingEntry, RebalancingRecord};
use crate::api::RankingCategory;

fn banner(out: &mut String, width: usize, title: &str) -> fmt::Result {
    let rule = "=".repeat(width);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{rule}")
}

pub fn holdings_table(snapshot: &PortfolioSnapshot) -> Result<String, fmt::Error> {
    let mut out = String::new();
    banner(&mut out, 50, "组合信息")?;
    writeln!(out, "组合代码: {}", snapshot.code)?;
    writeln!(out, "组合名称: {}", snapshot.name)?;
    writeln!(out, "净值: {:.4}", snapshot.net_value)?;
    writeln!(out, "现金比例: {}", snapshot.cash_ratio)?;
    writeln!(out, "更新时间: {}", snapshot.retrieved_at)?;
    writeln!(out, "持仓数量: {}", snapshot.holding_count)?;

    banner(&mut out, 50, "持仓明细")?;
    writeln!(out, "{:<12} {:<15} {:<12} {:<12} {:<15}", "股票代码", "股票名称", "当前权重", "目标权重", "行业")?;
    writeln!(out, "{}", "-".repeat(80))?;
    for h in &snapshot.holdings {
        writeln!(
            out,
            "{:<12} {:<15} {:<12} {:<12} {:<15}",
            h.stock_code, h.stock_name, h.weight, h.target_weight, h.sector
        )?;
    }
    Ok(out)
}

pub fn history_table(records: &[RebalancingRecord]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    banner(&mut out, 80, &format!("调仓历史记录 (最近{}条)", records.len()))?;
    writeln!(
        out,
        "{:<20} {:<12} {:<15} {:<6} {:<10} {:<10} {:<10}",
        "时间", "股票代码", "股票名称", "操作", "原权重", "目标权重", "价格"
    )?;
    writeln!(out, "{}", "-".repeat(80))?;
    for r in records {
        writeln!(
            out,
            "{:<20} {:<12} {:<15} {:<6} {:<10} {:<10} {:<10}",
            r.created_at,
            r.stock_code,
            r.stock_name,
            r.action.to_string(),
            r.prev_weight,
            r.target_weight,
            r.price
        )?;
    }
    Ok(out)
}

pub fn ranking_table(category: RankingCategory, entries: &[RankingEntry]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    banner(&mut out, 100, &format!("雪球组合{} (前{}名)", category.label(), entries.len()))?;
    writeln!(
        out,
        "{:<6} {:<20} {:<12} {:<12} {:<12} {:<10} {:<10}",
        "排名", "组合名称", "组合代码", "年化收益", "总收益", "日收益", "关注人数"
    )?;
    writeln!(out, "{}", "-".repeat(100))?;
    for e in entries {
        writeln!(
            out,
            "{:<6} {:<20} {:<12} {:<12} {:<12} {:<10} {:<10}",
            e.rank,
            e.name,
            e.code,
            e.annualized_return,
            e.total_return,
            e.daily_return,
            e.follower_count.to_string()
        )?;
    }
    Ok(out)
}
