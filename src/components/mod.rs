pub mod browser_modal;
pub mod sidebar;
pub mod task_panel;
