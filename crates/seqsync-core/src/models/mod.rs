mod actor_set;
mod sequence;

pub use actor_set::ActorSet;
pub use sequence::{
    Condition, ConditionKind, Document, DocumentStatistics, Loop, Message, Node, Parallel,
};
