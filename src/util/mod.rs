/*!
Types and routines shared by the NFA and DFA modules.
*/

pub mod charset;
pub mod id;

pub(crate) mod sparse_set;
