pub mod buffer_pool;
pub mod lock;
pub mod permissions;
pub mod transaction_id;
pub mod wait_for_graph;
