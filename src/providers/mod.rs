pub mod nckvs;
