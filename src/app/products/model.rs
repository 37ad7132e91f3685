//! 产品数据模型

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

/// 客户端提交的附加字段，原样存储并在响应中作为顶层成员返回
pub type Attributes = Map<String, Value>;

const ID_FIELD: &str = "id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Product {
    /// 由创建请求生成新产品，`id` 由服务端生成
    pub fn from_request(request: CreateProductRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: request.name,
            category: request.category,
            attributes: without_id(request.attributes),
        }
    }

    /// 浅合并：请求中出现的字段覆盖现有值，其余字段保持不变，`id` 不可修改
    pub fn merge(&mut self, patch: UpdateProductRequest) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        self.attributes.extend(without_id(patch.attributes));
    }
}

fn without_id(mut attributes: Attributes) -> Attributes {
    attributes.remove(ID_FIELD);
    attributes
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// 字段缺失表示不修改；显式的 `null` 与空字符串一样无法通过校验
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::<String>::deserialize(deserializer)?.unwrap_or_default()))
}

/// 列表查询参数，`page`/`limit` 为空时使用默认值
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchProductsQuery {
    pub name: Option<String>,
}
