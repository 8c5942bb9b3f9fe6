pub mod shadow_calendar;
