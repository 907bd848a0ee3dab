//! Immutable problem entities. Everything here is built once from the
//! caller's input and never mutated by the solver.

pub mod boundary;
pub mod capacity;
pub mod location;
pub mod shipment;
pub mod stop;
pub mod stop_builder;
pub mod time_window;
pub mod vehicle;

use location::{Location, LocationIdx};
use shipment::Shipment;
use stop_builder::StopLayout;
use vehicle::Vehicle;

use crate::error::ProblemError;

/// A fully materialized routing problem: entities plus the travel matrices
/// and the derived stop layout. Constructed once via
/// [`Problem::from_boundary`]; read-only from then on.
#[derive(Debug, Clone)]
pub struct Problem {
    locations: Vec<Location>,
    vehicles: Vec<Vehicle>,
    shipments: Vec<Shipment>,
    /// Row-major, `N_locations x N_locations`, minutes.
    travel_time: Vec<i64>,
    /// Row-major, `N_locations x N_locations`, kilometers.
    travel_distance: Vec<i64>,
    /// Row-major, `N_locations x N_locations`, minutes; all-zero if absent.
    setup_time: Vec<i64>,
    stop_layout: StopLayout,
}

impl Problem {
    /// Builds a `Problem` from boundary data, validating references and
    /// matrix shapes before any CP variable is allocated. Fails fast: a
    /// malformed input never reaches the solver.
    pub fn from_boundary(
        locations: Vec<Location>,
        vehicles: Vec<Vehicle>,
        shipments: Vec<Shipment>,
        travel_time: Vec<i64>,
        travel_distance: Vec<i64>,
        setup_time: Option<Vec<i64>>,
    ) -> Result<Problem, ProblemError> {
        let n = locations.len();
        let setup_time = setup_time.unwrap_or_else(|| vec![0; n * n]);

        validate_matrix_shape(&travel_time, n, |expected, rows, cols| {
            ProblemError::MatrixShapeMismatch {
                expected,
                rows,
                cols,
            }
        })?;
        validate_matrix_shape(&travel_distance, n, |expected, rows, cols| {
            ProblemError::MatrixShapeMismatch {
                expected,
                rows,
                cols,
            }
        })?;
        validate_matrix_shape(&setup_time, n, |expected, rows, cols| {
            ProblemError::SetupMatrixShapeMismatch {
                expected,
                rows,
                cols,
            }
        })?;

        for (idx, vehicle) in vehicles.iter().enumerate() {
            if vehicle.start_depot().get() >= n {
                return Err(ProblemError::UnknownDepot {
                    vehicle: idx,
                    location: vehicle.start_depot().get(),
                });
            }
            if vehicle.end_depot().get() >= n {
                return Err(ProblemError::UnknownDepot {
                    vehicle: idx,
                    location: vehicle.end_depot().get(),
                });
            }
            if vehicle.capacity().weight < 0 || vehicle.capacity().volume < 0 {
                return Err(ProblemError::NegativeCapacity {
                    vehicle: idx,
                    weight: vehicle.capacity().weight as f64,
                    volume: vehicle.capacity().volume as f64,
                });
            }
        }

        for (idx, shipment) in shipments.iter().enumerate() {
            if shipment.pickup_location().get() >= n {
                return Err(ProblemError::UnknownLocation {
                    shipment: idx,
                    location: shipment.pickup_location().get(),
                });
            }
            if shipment.delivery_location().get() >= n {
                return Err(ProblemError::UnknownLocation {
                    shipment: idx,
                    location: shipment.delivery_location().get(),
                });
            }
            if shipment.cargo().weight < 0 || shipment.cargo().volume < 0 {
                return Err(ProblemError::NegativeCargo {
                    shipment: idx,
                    weight: shipment.cargo().weight as f64,
                    volume: shipment.cargo().volume as f64,
                });
            }
        }

        let stop_layout = stop_builder::build_stop_layout(&vehicles, &shipments, &locations);

        Ok(Problem {
            locations,
            vehicles,
            shipments,
            travel_time,
            travel_distance,
            setup_time,
            stop_layout,
        })
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    pub fn shipments_mut(&mut self) -> &mut [Shipment] {
        &mut self.shipments
    }

    pub fn stop_layout(&self) -> &StopLayout {
        &self.stop_layout
    }

    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> i64 {
        self.travel_time[from.get() * self.num_locations() + to.get()]
    }

    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> i64 {
        self.travel_distance[from.get() * self.num_locations() + to.get()]
    }

    pub fn setup_time(&self, from: LocationIdx, to: LocationIdx) -> i64 {
        self.setup_time[from.get() * self.num_locations() + to.get()]
    }

    pub fn travel_time_table(&self) -> &[i64] {
        &self.travel_time
    }

    pub fn travel_distance_table(&self) -> &[i64] {
        &self.travel_distance
    }

    pub fn setup_time_table(&self) -> &[i64] {
        &self.setup_time
    }
}

fn validate_matrix_shape(
    matrix: &[i64],
    expected: usize,
    err: impl FnOnce(usize, usize, usize) -> ProblemError,
) -> Result<(), ProblemError> {
    if matrix.len() != expected * expected {
        let rows = if expected == 0 {
            0
        } else {
            matrix.len() / expected
        };
        return Err(err(expected, rows, expected));
    }
    Ok(())
}
