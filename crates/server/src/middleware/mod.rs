mod model_loaders;

pub use model_loaders::{
    load_brand_middleware, load_communication_middleware, load_contact_middleware,
    load_document_middleware, load_task_middleware,
};
