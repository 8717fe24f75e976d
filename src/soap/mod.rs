pub mod envelope;
pub mod wsdl;
