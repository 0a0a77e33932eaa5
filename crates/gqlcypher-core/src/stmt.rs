mod capability;
pub use capability::{Filterable, Orderable};

mod clause;
pub use clause::Clause;

mod clause_call;
pub use clause_call::Call;

mod clause_create;
pub use clause_create::Create;

mod clause_delete;
pub use clause_delete::Delete;

mod clause_match;
pub use clause_match::Match;

mod clause_merge;
pub use clause_merge::Merge;

mod clause_remove;
pub use clause_remove::Remove;

mod clause_return;
pub use clause_return::Return;

mod clause_set;
pub use clause_set::{Set, SetItem};

mod clause_union;
pub use clause_union::Union;

mod clause_unwind;
pub use clause_unwind::Unwind;

mod clause_with;
pub use clause_with::With;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_case;
pub use expr_case::ExprCase;

mod expr_func;
pub use expr_func::ExprFunc;

mod expr_has_labels;
pub use expr_has_labels::ExprHasLabels;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_list;
pub use expr_list::ExprList;

mod expr_list_predicate;
pub use expr_list_predicate::{ExprListPredicate, Quantifier};

mod expr_map;
pub use expr_map::ExprMap;

mod expr_map_projection;
pub use expr_map_projection::{ExprMapProjection, MapProjectionItem};

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_property;
pub use expr_property::ExprProperty;

mod expr_reduce;
pub use expr_reduce::ExprReduce;

mod expr_slice;
pub use expr_slice::ExprSlice;

mod expr_subquery;
pub use expr_subquery::{ExprCount, ExprExists};

mod expr_xor;
pub use expr_xor::ExprXor;

mod node;
pub use node::Node;

mod op_binary;
pub use op_binary::BinaryOp;

mod ordering;
pub use ordering::{Ordering, SortDirection, SortItem};

mod param;
pub use param::Param;

mod param_table;
pub use param_table::ParamTable;

mod pattern;
pub use pattern::{Direction, NodePattern, Pattern, PatternStep, RelationshipPattern};

mod projection;
pub use projection::{Projection, ProjectionItem};

mod statement;
pub use statement::Statement;

mod value;
pub use value::Value;

mod variable;
pub use variable::Variable;

pub mod visit;
pub use visit::Visit;
