pub mod endpoint_model;
pub mod method_model;
pub mod request_model;

pub use endpoint_model::{
    EndpointConfig, EndpointDefinition, EndpointManifest, Handler, HandlerFn, Invocable,
    ManifestSet, MethodsField, PermissionCheck, PermissionFn, SchemaProducer, SchemaSource,
};
pub use method_model::MethodSet;
pub use request_model::{RestRequest, RestResponse};
