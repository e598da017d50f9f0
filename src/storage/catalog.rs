//! The catalog: a map from table id to access method, injected into the
//! buffer pool rather than reached for as a global (spec.md section 9,
//! "Global catalog" note). Grounded in the teacher's `database::Catalog`
//! (`table_id_table_map: HashMap<i32, Arc<RwLock<HeapTable>>>`), simplified
//! since schema validation and table lookup by name are out of scope here.

use crate::field::TupleDesc;
use crate::storage::access_method::AccessMethod;
use crate::storage::heap_file::HeapFile;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub trait Catalog: Send + Sync {
    fn get_access_method(&self, table_id: i32) -> Option<Arc<dyn AccessMethod>>;
    fn get_heap_file(&self, table_id: i32) -> Option<Arc<HeapFile>>;
}

#[derive(Default)]
pub struct SimpleCatalog {
    tables: RwLock<HashMap<i32, Arc<HeapFile>>>,
}

impl SimpleCatalog {
    pub fn new() -> SimpleCatalog {
        SimpleCatalog {
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn add_table(&self, table_id: i32, file: Arc<HeapFile>) {
        self.tables.write().unwrap().insert(table_id, file);
    }

    pub fn table_desc(&self, table_id: i32) -> Option<Arc<TupleDesc>> {
        self.tables
            .read()
            .unwrap()
            .get(&table_id)
            .map(|f| Arc::clone(f.desc()))
    }
}

impl Catalog for SimpleCatalog {
    fn get_access_method(&self, table_id: i32) -> Option<Arc<dyn AccessMethod>> {
        self.tables
            .read()
            .unwrap()
            .get(&table_id)
            .map(|f| Arc::clone(f) as Arc<dyn AccessMethod>)
    }

    fn get_heap_file(&self, table_id: i32) -> Option<Arc<HeapFile>> {
        self.tables.read().unwrap().get(&table_id).map(Arc::clone)
    }
}
