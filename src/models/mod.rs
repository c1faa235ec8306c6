// Domain models: raw feed shape, validated records, views, history, capacity

mod capacity;
mod change;
mod feed;
mod history;
mod view;

pub use capacity::{CapacityConfig, CapacityProvider};
pub use change::{Change, Job, JobState, QueuedChange, UNKNOWN_USER};
pub use feed::{RawChange, RawChangeQueue, RawJob, RawOwner, RawPipeline, StatusDocument};
pub use history::{HistorySample, QueueCounts};
pub use view::{
    AggregateCounts, ChangeView, FontWeight, JobColor, JobStyle, JobView, ViewModel,
};
