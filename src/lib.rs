pub mod adapter;
pub mod annotate;
pub mod bbox;
pub mod bev;
pub mod config;
pub mod detection;
pub mod detector;
pub mod error;
pub mod math;
pub mod session;
pub mod smoother;
pub mod source;

mod draw;

pub use bev::{BevConfig, BevProjector, Quad};
pub use config::Config;
pub use detection::{Detection, RawDetection, UNTRACKED};
pub use error::Error;
pub use session::{RenderMode, Session};
pub use smoother::PositionSmoother;
