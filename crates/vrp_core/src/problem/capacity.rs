/// Weight/volume pair, already scaled to integers by
/// `Config::capacity_scale_factor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Capacity {
    pub weight: i64,
    pub volume: i64,
}

impl Capacity {
    pub const EMPTY: Capacity = Capacity {
        weight: 0,
        volume: 0,
    };

    pub fn new(weight: i64, volume: i64) -> Self {
        Capacity { weight, volume }
    }

    pub fn from_boundary(weight: f64, volume: f64, scale_factor: i64) -> Self {
        Capacity {
            weight: (weight * scale_factor as f64).round() as i64,
            volume: (volume * scale_factor as f64).round() as i64,
        }
    }
}
