pub use self::postgre::{get_path, PoolOption, PoolType, QueryResult};
mod postgre;
