use dioxus::{
    desktop::{tao::event::Event, use_wry_event_handler, WindowEvent},
    prelude::*,
};

use crate::tracker::TrackerLaunch;

/// Stops the poller when the window is asked to close, and again on unmount
/// in case the app is torn down some other way.
///
/// **Needs to be called from inside the launched app**
pub fn init(launch: TrackerLaunch) {
    {
        let launch = launch.clone();
        use_wry_event_handler(move |event, _| {
            if let Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } = event
            {
                launch.stop_poller();
            }
        });
    }

    use_drop(move || launch.stop_poller());
}
