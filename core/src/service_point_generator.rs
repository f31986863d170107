//! Service points (table_c). Independent of every other table.

use crate::{
    error::FleetResult,
    fake_data::{FakeData, SERVICE_POINT_KINDS},
    generator::{GenerationContext, GenerationStep},
    rng::TableRng,
    store::DataStore,
    types::{RecordId, Table},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePoint {
    pub service_point_id: RecordId,
    pub address:          String,
    pub city:             String,
    pub label:            String,
    pub region:           String,
    /// Opaque `Type A/B/C` enumeration.
    pub kind:             String,
    pub active:           bool,
    /// Set only for inactive points.
    pub deactivated_at:   Option<NaiveDateTime>,
    pub latitude:         f64,
    pub longitude:        f64,
}

pub struct ServicePointStep {
    count: usize,
}

impl ServicePointStep {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl GenerationStep for ServicePointStep {
    fn table(&self) -> Table {
        Table::ServicePoints
    }

    fn generate(
        &mut self,
        store: &DataStore,
        ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize> {
        for _ in 0..self.count {
            let service_point_id = ctx.ids.next(rng)?;
            let address = FakeData::street_address(rng);
            let city = FakeData::city(rng).to_string();
            let label = FakeData::word(rng).to_string();
            let region = FakeData::region(rng).to_string();
            let kind = rng.pick(&SERVICE_POINT_KINDS).copied().unwrap_or("Type A").to_string();
            let active = rng.chance(0.5);
            let deactivated_at = if active {
                None
            } else {
                Some(rng.datetime_between(ctx.start_of_decade(), ctx.now))
            };

            let point = ServicePoint {
                service_point_id,
                address,
                city,
                label,
                region,
                kind,
                active,
                deactivated_at,
                latitude: FakeData::latitude(rng),
                longitude: FakeData::longitude(rng),
            };
            store.insert_service_point(&point)?;
        }
        Ok(self.count)
    }
}
