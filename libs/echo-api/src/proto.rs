//! Protobuf-сообщения пакета `benchmark`.
//!
//! ```proto
//! syntax = "proto3";
//! package benchmark;
//!
//! message Data {
//!   string id = 1;
//!   string name = 2;
//!   int32 value = 3;
//! }
//!
//! service API {
//!   rpc SendData(Data) returns (Data);
//! }
//! ```

#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct Data {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(int32, tag = "3")]
    pub value: i32,
}
