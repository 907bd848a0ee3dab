use fxhash::FxHashSet;

use super::{capacity::Capacity, location::LocationIdx, time_window::TimeWindow};

crate::define_index_newtype!(ShipmentIdx, Shipment);

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Shipment {
    external_id: String,
    pickup_location: LocationIdx,
    delivery_location: LocationIdx,
    cargo: Capacity,
    pickup_window: TimeWindow,
    delivery_window: TimeWindow,
    required_tags: FxHashSet<String>,
    priority: i64,
    unserved_penalty: Option<i64>,
}

impl Shipment {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn pickup_location(&self) -> LocationIdx {
        self.pickup_location
    }

    pub fn delivery_location(&self) -> LocationIdx {
        self.delivery_location
    }

    pub fn cargo(&self) -> Capacity {
        self.cargo
    }

    pub fn pickup_window(&self) -> TimeWindow {
        self.pickup_window
    }

    pub fn delivery_window(&self) -> TimeWindow {
        self.delivery_window
    }

    pub fn set_delivery_window(&mut self, window: TimeWindow) {
        self.delivery_window = window;
    }

    pub fn required_tags(&self) -> &FxHashSet<String> {
        &self.required_tags
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Falls back to `Config::unserved_penalty` when unset.
    pub fn unserved_penalty(&self, default: i64) -> i64 {
        self.unserved_penalty.unwrap_or(default)
    }
}

#[derive(Default)]
pub struct ShipmentBuilder {
    external_id: Option<String>,
    pickup_location: Option<LocationIdx>,
    delivery_location: Option<LocationIdx>,
    cargo: Option<Capacity>,
    pickup_window: Option<TimeWindow>,
    delivery_window: Option<TimeWindow>,
    required_tags: Option<Vec<String>>,
    priority: Option<i64>,
    unserved_penalty: Option<i64>,
}

impl ShipmentBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_pickup_location(&mut self, location: LocationIdx) -> &mut Self {
        self.pickup_location = Some(location);
        self
    }

    pub fn set_delivery_location(&mut self, location: LocationIdx) -> &mut Self {
        self.delivery_location = Some(location);
        self
    }

    pub fn set_cargo(&mut self, cargo: Capacity) -> &mut Self {
        self.cargo = Some(cargo);
        self
    }

    pub fn set_pickup_window(&mut self, window: TimeWindow) -> &mut Self {
        self.pickup_window = Some(window);
        self
    }

    pub fn set_delivery_window(&mut self, window: TimeWindow) -> &mut Self {
        self.delivery_window = Some(window);
        self
    }

    pub fn set_required_tags(&mut self, tags: Vec<String>) -> &mut Self {
        self.required_tags = Some(tags);
        self
    }

    pub fn set_priority(&mut self, priority: i64) -> &mut Self {
        self.priority = Some(priority);
        self
    }

    pub fn set_unserved_penalty(&mut self, penalty: i64) -> &mut Self {
        self.unserved_penalty = Some(penalty);
        self
    }

    pub fn build(self) -> Shipment {
        Shipment {
            external_id: self.external_id.expect("external id is required"),
            pickup_location: self.pickup_location.expect("pickup location is required"),
            delivery_location: self
                .delivery_location
                .expect("delivery location is required"),
            cargo: self.cargo.unwrap_or(Capacity::EMPTY),
            pickup_window: self.pickup_window.expect("pickup window is required"),
            delivery_window: self.delivery_window.expect("delivery window is required"),
            required_tags: self.required_tags.unwrap_or_default().into_iter().collect(),
            priority: self.priority.unwrap_or(0),
            unserved_penalty: self.unserved_penalty,
        }
    }
}
