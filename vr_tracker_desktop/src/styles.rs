pub const LAYOUT: &str = "layout";
pub const SIDEBAR: &str = "sidebar";
pub const NAV_LINK: &str = "nav-link";
pub const CONTENT: &str = "content";
pub const PAGE_CONTAINER: &str = "page";
pub const HEADING: &str = "heading";
pub const MUTED_TEXT: &str = "muted";
pub const PANEL_GRID: &str = "panel-grid";
pub const PANEL: &str = "panel";
pub const PANEL_IDLE: &str = "panel idle";
pub const FIELD_ROW: &str = "field-row";
pub const FIELD_LABEL: &str = "field-label";
pub const FIELD: &str = "field";
pub const FIELD_WIDE: &str = "field wide";
pub const BUTTON_PRIMARY: &str = "button";
pub const SETTINGS_TABLE: &str = "settings-table";
