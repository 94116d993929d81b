//! CrudService: generic CRUD over the entity field lists using the safe SQL builder.

mod crud;
pub use crud::CrudService;
