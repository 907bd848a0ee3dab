//! Materializes the `Stop` list from vehicles and shipments: one start and
//! one end depot per vehicle, one pickup and one delivery per shipment.

use super::{
    location::{Location, LocationIdx},
    shipment::{Shipment, ShipmentIdx},
    stop::{Stop, StopIdx, StopKind},
    vehicle::{Vehicle, VehicleIdx},
};

/// The fixed index layout of the stop list: `N_v` start depots, then
/// `2*N_s` pickup/delivery stops interleaved per shipment, then `N_v` end
/// depots. Index arithmetic replaces a lookup table for depot stops, and a
/// small offset table covers shipment stops.
#[derive(Debug, Clone)]
pub struct StopLayout {
    num_vehicles: usize,
    num_shipments: usize,
    stops: Vec<Stop>,
}

impl StopLayout {
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    pub fn num_shipments(&self) -> usize {
        self.num_shipments
    }

    pub fn start_stop(&self, vehicle: VehicleIdx) -> StopIdx {
        StopIdx::new(vehicle.get())
    }

    pub fn end_stop(&self, vehicle: VehicleIdx) -> StopIdx {
        StopIdx::new(self.num_vehicles + 2 * self.num_shipments + vehicle.get())
    }

    pub fn pickup_stop(&self, shipment: ShipmentIdx) -> StopIdx {
        StopIdx::new(self.num_vehicles + 2 * shipment.get())
    }

    pub fn delivery_stop(&self, shipment: ShipmentIdx) -> StopIdx {
        StopIdx::new(self.num_vehicles + 2 * shipment.get() + 1)
    }
}

pub fn build_stop_layout(
    vehicles: &[Vehicle],
    shipments: &[Shipment],
    locations: &[Location],
) -> StopLayout {
    let num_vehicles = vehicles.len();
    let num_shipments = shipments.len();
    let mut stops = Vec::with_capacity(2 * num_vehicles + 2 * num_shipments);

    for (idx, vehicle) in vehicles.iter().enumerate() {
        stops.push(Stop::new(
            StopKind::DepotStart,
            vehicle.start_depot(),
            Some(VehicleIdx::new(idx)),
            None,
            0,
            0,
            0,
            locations[vehicle.start_depot()].zone(),
        ));
    }

    for (idx, shipment) in shipments.iter().enumerate() {
        let shipment_idx = ShipmentIdx::new(idx);
        let pickup_location = shipment.pickup_location();
        let delivery_location = shipment.delivery_location();
        let cargo = shipment.cargo();

        stops.push(Stop::new(
            StopKind::Pickup,
            pickup_location,
            None,
            Some(shipment_idx),
            cargo.weight,
            cargo.volume,
            locations[pickup_location].default_service_duration(),
            locations[pickup_location].zone(),
        ));
        stops.push(Stop::new(
            StopKind::Delivery,
            delivery_location,
            None,
            Some(shipment_idx),
            -cargo.weight,
            -cargo.volume,
            locations[delivery_location].default_service_duration(),
            locations[delivery_location].zone(),
        ));
    }

    for (idx, vehicle) in vehicles.iter().enumerate() {
        stops.push(Stop::new(
            StopKind::DepotEnd,
            vehicle.end_depot(),
            Some(VehicleIdx::new(idx)),
            None,
            0,
            0,
            0,
            locations[vehicle.end_depot()].zone(),
        ));
    }

    StopLayout {
        num_vehicles,
        num_shipments,
        stops,
    }
}

pub fn stop_to_loc_table(layout: &StopLayout) -> Vec<i64> {
    layout
        .stops()
        .iter()
        .map(|stop| stop.location().get() as i64)
        .collect()
}

pub fn stop_weight_delta_table(layout: &StopLayout) -> Vec<i64> {
    layout.stops().iter().map(|stop| stop.weight_delta()).collect()
}

pub fn stop_volume_delta_table(layout: &StopLayout) -> Vec<i64> {
    layout.stops().iter().map(|stop| stop.volume_delta()).collect()
}

pub fn stop_service_duration_table(layout: &StopLayout) -> Vec<i64> {
    layout
        .stops()
        .iter()
        .map(|stop| stop.service_duration())
        .collect()
}

pub fn stop_zone_table(layout: &StopLayout) -> Vec<i64> {
    layout.stops().iter().map(|stop| stop.zone()).collect()
}

/// Earliest acceptable arrival at each stop: the shipment window start for
/// pickup/delivery stops, `0` for depot stops.
pub fn stop_ready_time_table(layout: &StopLayout, shipments: &[Shipment]) -> Vec<i64> {
    layout
        .stops()
        .iter()
        .map(|stop| match stop.kind() {
            StopKind::Pickup => shipments[stop.shipment().unwrap().get()].pickup_window().start(),
            StopKind::Delivery => shipments[stop.shipment().unwrap().get()]
                .delivery_window()
                .start(),
            StopKind::DepotStart | StopKind::DepotEnd => 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{capacity::Capacity, time_window::TimeWindow, vehicle::VehicleBuilder};
    use crate::problem::shipment::ShipmentBuilder;

    fn sample_locations() -> Vec<Location> {
        vec![
            Location::new("depot", 0.0, 0.0, 0, 0),
            Location::new("pickup", 0.0, 1.0, 5, 1),
            Location::new("delivery", 0.0, 2.0, 5, 2),
        ]
    }

    #[test]
    fn layout_matches_spec_ordering() {
        let locations = sample_locations();
        let mut vehicle_builder = VehicleBuilder::default();
        vehicle_builder.set_external_id("v1");
        vehicle_builder.set_start_depot(LocationIdx::new(0));
        vehicle_builder.set_end_depot(LocationIdx::new(0));
        let vehicle = vehicle_builder.build();

        let mut shipment_builder = ShipmentBuilder::default();
        shipment_builder.set_external_id("s1");
        shipment_builder.set_pickup_location(LocationIdx::new(1));
        shipment_builder.set_delivery_location(LocationIdx::new(2));
        shipment_builder.set_cargo(Capacity::new(10, 10));
        shipment_builder.set_pickup_window(TimeWindow::new(0, 100));
        shipment_builder.set_delivery_window(TimeWindow::new(0, 200));
        let shipment = shipment_builder.build();

        let layout = build_stop_layout(&[vehicle], &[shipment], &locations);

        assert_eq!(layout.num_stops(), 4);
        assert_eq!(layout.start_stop(VehicleIdx::new(0)), StopIdx::new(0));
        assert_eq!(layout.pickup_stop(ShipmentIdx::new(0)), StopIdx::new(1));
        assert_eq!(layout.delivery_stop(ShipmentIdx::new(0)), StopIdx::new(2));
        assert_eq!(layout.end_stop(VehicleIdx::new(0)), StopIdx::new(3));

        let stops = layout.stops();
        assert_eq!(stops[1].weight_delta(), 10);
        assert_eq!(stops[2].weight_delta(), -10);
    }
}
