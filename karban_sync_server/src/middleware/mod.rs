mod acl;

pub use acl::{AclMiddlewareFactory, AclMiddlewareService, API_KEY_HEADER};
