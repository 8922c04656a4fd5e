use super::types::{ComparisonSummary, MonthlySnapshot, Verdict, YearSummary};

/// Headline figures for a finished run. `None` when the run produced no months.
pub fn summarize(snapshots: &[MonthlySnapshot]) -> Option<ComparisonSummary> {
    let last = snapshots.last()?;

    let mut total_interest_paid = 0.0;
    let mut total_principal_paid = 0.0;
    let mut total_buying_costs = 0.0;
    let mut total_renting_costs = 0.0;
    for snapshot in snapshots {
        total_interest_paid += snapshot.interest_paid;
        total_principal_paid += snapshot.principal_paid;
        total_buying_costs += snapshot.monthly_buying_costs;
        total_renting_costs += snapshot.monthly_renting_costs;
    }

    let breakeven_month = snapshots
        .iter()
        .find(|snapshot| snapshot.net_worth_delta >= 0.0)
        .map(|snapshot| snapshot.month);

    Some(ComparisonSummary {
        months: last.month,
        total_interest_paid,
        total_principal_paid,
        total_buying_costs,
        total_renting_costs,
        final_home_value: last.home_value,
        final_investment_value: last.invested_down_payment,
        final_buyer_net_worth: last.buyer_net_worth,
        final_renter_net_worth: last.renter_net_worth,
        final_net_worth_delta: last.net_worth_delta,
        breakeven_month,
        verdict: if last.net_worth_delta > 0.0 {
            Verdict::Buy
        } else {
            Verdict::Rent
        },
    })
}

/// Collapses monthly snapshots into one row per 12-month block, reporting the
/// block's closing positions and its summed costs. A trailing partial block still
/// gets a row.
pub fn yearly_rollup(snapshots: &[MonthlySnapshot]) -> Vec<YearSummary> {
    snapshots
        .chunks(12)
        .zip(1u32..)
        .filter_map(|(block, year)| {
            let closing = block.last()?;
            Some(YearSummary {
                year,
                home_value: closing.home_value,
                home_equity: closing.home_equity,
                remaining_balance: closing.remaining_balance,
                monthly_rent: closing.monthly_rent,
                buying_costs: block.iter().map(|s| s.monthly_buying_costs).sum(),
                renting_costs: block.iter().map(|s| s.monthly_renting_costs).sum(),
                buyer_net_worth: closing.buyer_net_worth,
                renter_net_worth: closing.renter_net_worth,
                net_worth_delta: closing.net_worth_delta,
            })
        })
        .collect()
}
