//! # ProcrastiNUS Core Library
//!
//! This library provides the business logic behind ProcrastiNUS, a
//! gamified study companion for NUS students. Every operation is available
//! through the standalone `procrastinus-cli` binary, which is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Reward Engine**: turns finished study sessions into coins, study
//!   minutes and badges
//! - **Pet Model**: hunger decay and passive experience computed lazily from
//!   the time elapsed since the last update
//! - **Academic Calendar**: resolves academic years and week labels
//!   (Week N, Recess Week, Reading Week, Vacation) from a data table
//! - **Timetable Import**: parses NUSMods share links and fetches class slots
//! - **Calendar Layout**: packs overlapping events into lanes
//! - **Storage**: hierarchical JSON documents (SQLite or in-memory) and
//!   TOML configuration
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: countdown/stopwatch state machine
//! - [`StudyService`]: records sessions and applies rewards
//! - [`AcademicCalendarTable`]: academic calendar resolver
//! - [`DocumentStore`]: storage seam implemented by [`SqliteStore`] and [`MemoryStore`]
//! - [`Config`]: application configuration management

pub mod academic;
pub mod calendar;
pub mod error;
pub mod events;
pub mod pet;
pub mod reward;
pub mod services;
pub mod shop;
pub mod storage;
pub mod task;
pub mod timer;
pub mod timetable;

pub use academic::{AcademicCalendarTable, AcademicYear, SemesterDates, WeekLabel};
pub use calendar::{events_on_date, layout_day, position_day, CalendarEvent, EventBox, LayoutScale};
pub use error::{ConfigError, CoreError, ImportError, StoreError, ValidationError};
pub use events::Event;
pub use pet::{compute_decay, DecayParams, PetState};
pub use reward::{
    check_custom_duration, evaluate_session, Badge, DurationCheck, RewardRules, SessionMode,
    SessionReward,
};
pub use services::{leaderboard, PetService, ShopService, StudyService, WalletWatcher};
pub use shop::{FoodItem, InventoryState, WalletState};
pub use storage::{Config, DocumentStore, MemoryStore, SqliteStore};
pub use task::{Task, TaskList};
pub use timer::{FinishedSession, FocusTimer, TimerMode, TimerState};
pub use timetable::{parse_schedule_url, NusModsClient, ScheduleShare, TimetableSource};
