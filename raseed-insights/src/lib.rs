//! raseed-insights: question interpreter, grounding gate, dashboard snapshot
//! and shopping-list consolidation.

pub mod dashboard;
pub mod grounding;
pub mod interpreter;
pub mod shopping_list;

pub use dashboard::DashboardSnapshot;
pub use grounding::{
    absence_statement, answer_grounded, ground_question, AnsweringCollaborator, GroundedContext,
    Grounding,
};
pub use interpreter::{Interpretation, QuestionInterpreter};
pub use shopping_list::consolidate_items;
