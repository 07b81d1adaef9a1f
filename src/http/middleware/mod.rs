pub mod dispatch;

pub use dispatch::{dispatch_middleware, AppBinding, DispatchState};
