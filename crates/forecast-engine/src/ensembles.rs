//! Per-member ensemble table.

use forecast_store::ForecastArray;
use hydro_common::{Cms, FlowTable, HydroResult};

use crate::selector::MemberSelection;

/// One `ensemble_NN` column per member, ordered by raw label, unclamped.
/// Members outside the selection are removed.
pub fn ensemble_table(
    array: &ForecastArray,
    high_res_label: u16,
    selection: &MemberSelection,
) -> HydroResult<FlowTable<Cms>> {
    let mut order: Vec<(u16, usize)> = array
        .members()
        .iter()
        .enumerate()
        .map(|(pos, m)| (m.label(high_res_label), pos))
        .collect();
    order.sort();

    let labels: Vec<u16> = order.iter().map(|(label, _)| *label).collect();
    let dropped = selection.drop_set(&labels);

    let mut table = FlowTable::<Cms>::new(array.times().to_vec());
    for (label, pos) in order {
        if dropped.contains(&label) {
            continue;
        }
        table.push_series(format!("ensemble_{:02}", label), array.member_values(pos).to_vec())?;
    }
    Ok(table)
}
