use serde::{Deserialize, Serialize};

use crate::proto;

/// Запись, которой обмениваются оба echo-сервиса.
///
/// Текстовое представление (JSON): `{"id":"123","name":"Test","value":42}`.
/// Бинарное представление — [`proto::Data`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub value: i32,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
        }
    }

    /// Запись, которую бенчмарк гоняет по умолчанию.
    pub fn sample() -> Self {
        Self::new("123", "Test", 42)
    }

    /// Echo-преобразование: `value + 1`, остальные поля без изменений.
    /// Переполнение заворачивается (как int32 на стороне gRPC).
    pub fn bumped(mut self) -> Self {
        self.value = self.value.wrapping_add(1);
        self
    }
}

impl From<proto::Data> for Record {
    fn from(data: proto::Data) -> Self {
        Self {
            id: data.id,
            name: data.name,
            value: data.value,
        }
    }
}

impl From<Record> for proto::Data {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            value: record.value,
        }
    }
}
