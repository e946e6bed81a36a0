mod navbar;
pub use navbar::Navbar;

mod device_panel;
pub use device_panel::DevicePanel;
