//! Vehicles (table_g) and the user–vehicle junction (table_h).

use crate::{
    error::{FleetError, FleetResult},
    fake_data::FakeData,
    generator::{GenerationContext, GenerationStep},
    rng::TableRng,
    store::DataStore,
    types::{RecordId, Table},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub account_id:    RecordId,
    pub vehicle_id:    RecordId,
    pub class_letter:  String,
    pub category_code: i64,
    pub make:          String,
    pub axle_code:     i64,
    pub model:         String,
    pub valid_from:    NaiveDateTime,
    /// Never before `valid_from`.
    pub valid_until:   NaiveDateTime,
    pub tag_code:      String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserVehicleLink {
    pub user_id:      RecordId,
    /// Contract shared by the user and the vehicle.
    pub account_id:   RecordId,
    pub vehicle_id:   RecordId,
    pub primary_flag: i64,
    pub linked_at:    NaiveDateTime,
}

// ── table_g ──────────────────────────────────────────────────────────────────

/// 1–3 vehicles per contract, each carrying a random asset tag.
pub struct VehicleStep;

impl GenerationStep for VehicleStep {
    fn table(&self) -> Table {
        Table::Vehicles
    }

    fn generate(
        &mut self,
        store: &DataStore,
        ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize> {
        let contract_ids = store.contract_ids()?;
        let tag_codes = store.asset_tag_codes()?;
        if tag_codes.is_empty() && !contract_ids.is_empty() {
            return Err(FleetError::MissingReference { table: Table::AssetTags.name() });
        }

        let mut written = 0usize;
        for &account_id in &contract_ids {
            let fleet_size = rng.int_between(1, 3);
            for _ in 0..fleet_size {
                let vehicle_id = ctx.ids.next(rng)?;
                let class_letter = FakeData::letter(rng);
                let category_code = rng.int_between(1, 5);
                let make = FakeData::company(rng);
                let axle_code = rng.int_between(1, 3);
                let model = FakeData::word(rng).to_string();
                let valid_from = rng.datetime_between(ctx.years_ago(3), ctx.now);
                let valid_until = rng.datetime_between(valid_from, ctx.now);
                let tag_code = rng
                    .pick(&tag_codes)
                    .cloned()
                    .ok_or(FleetError::MissingReference { table: Table::AssetTags.name() })?;

                store.insert_vehicle(&Vehicle {
                    account_id,
                    vehicle_id,
                    class_letter,
                    category_code,
                    make,
                    axle_code,
                    model,
                    valid_from,
                    valid_until,
                    tag_code,
                })?;
                written += 1;
            }
        }
        Ok(written)
    }
}

// ── table_h ──────────────────────────────────────────────────────────────────

/// Contract id → vehicles on that contract, in select order.
pub fn vehicles_by_contract(
    vehicles: &[(RecordId, RecordId)],
) -> HashMap<RecordId, Vec<RecordId>> {
    let mut index: HashMap<RecordId, Vec<RecordId>> = HashMap::new();
    for &(account_id, vehicle_id) in vehicles {
        index.entry(account_id).or_default().push(vehicle_id);
    }
    index
}

/// One link per (user, vehicle) pair sharing a contract.
pub struct UserVehicleLinkStep;

impl GenerationStep for UserVehicleLinkStep {
    fn table(&self) -> Table {
        Table::UserVehicleLinks
    }

    fn generate(
        &mut self,
        store: &DataStore,
        ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize> {
        let users = store.user_contract_pairs()?;
        let index = vehicles_by_contract(&store.vehicle_contract_pairs()?);

        let mut written = 0usize;
        for &(user_id, account_id) in &users {
            let Some(vehicle_ids) = index.get(&account_id) else {
                continue;
            };
            for &vehicle_id in vehicle_ids {
                store.insert_user_vehicle_link(&UserVehicleLink {
                    user_id,
                    account_id,
                    vehicle_id,
                    primary_flag: rng.int_between(0, 1),
                    linked_at: rng.datetime_between(ctx.years_ago(1), ctx.now),
                })?;
                written += 1;
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_nested_loop_join() {
        let users = [(1, 100), (2, 100), (3, 200), (4, 300)];
        let vehicles = [(100, 10), (200, 20), (100, 11), (400, 40)];

        let mut nested = Vec::new();
        for &(user, contract) in &users {
            for &(vehicle_contract, vehicle) in &vehicles {
                if contract == vehicle_contract {
                    nested.push((user, vehicle));
                }
            }
        }

        let index = vehicles_by_contract(&vehicles);
        let mut indexed = Vec::new();
        for &(user, contract) in &users {
            for &vehicle in index.get(&contract).map(Vec::as_slice).unwrap_or(&[]) {
                indexed.push((user, vehicle));
            }
        }

        assert_eq!(indexed, nested);
        assert_eq!(indexed, [(1, 10), (1, 11), (2, 10), (2, 11), (3, 20)]);
    }
}
