use super::{location::LocationIdx, shipment::ShipmentIdx, vehicle::VehicleIdx};

crate::define_index_newtype!(StopIdx, Stop);

/// One of the four logical routing nodes a `Stop` can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StopKind {
    DepotStart,
    DepotEnd,
    Pickup,
    Delivery,
}

/// A logical routing node, distinct from `Location`: the same physical
/// location can host several stops (one per shipment using it). Every
/// field but `kind`/`location`/`zone` is pre-computed once by the stop
/// builder so constraint modules never branch on `kind` — they index flat
/// tables keyed by `StopIdx` instead.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Stop {
    kind: StopKind,
    location: LocationIdx,
    vehicle: Option<VehicleIdx>,
    shipment: Option<ShipmentIdx>,
    weight_delta: i64,
    volume_delta: i64,
    service_duration: i64,
    zone: i64,
}

impl Stop {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        kind: StopKind,
        location: LocationIdx,
        vehicle: Option<VehicleIdx>,
        shipment: Option<ShipmentIdx>,
        weight_delta: i64,
        volume_delta: i64,
        service_duration: i64,
        zone: i64,
    ) -> Self {
        Stop {
            kind,
            location,
            vehicle,
            shipment,
            weight_delta,
            volume_delta,
            service_duration,
            zone,
        }
    }

    pub fn kind(&self) -> StopKind {
        self.kind
    }

    pub fn location(&self) -> LocationIdx {
        self.location
    }

    pub fn vehicle(&self) -> Option<VehicleIdx> {
        self.vehicle
    }

    pub fn shipment(&self) -> Option<ShipmentIdx> {
        self.shipment
    }

    pub fn weight_delta(&self) -> i64 {
        self.weight_delta
    }

    pub fn volume_delta(&self) -> i64 {
        self.volume_delta
    }

    pub fn service_duration(&self) -> i64 {
        self.service_duration
    }

    pub fn zone(&self) -> i64 {
        self.zone
    }

    pub fn is_depot(&self) -> bool {
        matches!(self.kind, StopKind::DepotStart | StopKind::DepotEnd)
    }
}
