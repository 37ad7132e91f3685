//! 产品业务服务

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    model::{CreateProductRequest, Product, UpdateProductRequest},
    store::ProductStore,
};
use crate::core::error::CoreError;
use crate::infrastructure::config::PaginationConfig;

/// 已校验的分页参数，`page` 从 1 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: usize,
    pub limit: usize,
}

impl Page {
    /// 缺省值取自配置；`page`/`limit` 必须为正数，`limit` 超过上限时截断
    pub fn resolve(
        page: Option<usize>,
        limit: Option<usize>,
        config: &PaginationConfig,
    ) -> Result<Self, CoreError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(config.default_limit);

        if page == 0 {
            return Err(CoreError::BadRequest("page must be at least 1".to_string()));
        }
        if limit == 0 {
            return Err(CoreError::BadRequest("limit must be at least 1".to_string()));
        }

        Ok(Self {
            page,
            limit: limit.min(config.max_limit),
        })
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// 每个操作在一次加锁内完成，查找与修改之间不会被其他请求插入
#[derive(Clone, Default)]
pub struct ProductService {
    store: Arc<RwLock<ProductStore>>,
}

impl ProductService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_products(&self, category: Option<&str>, page: Page) -> Vec<Product> {
        let store = self.store.read();
        store
            .list(category)
            .into_iter()
            .skip(page.offset())
            .take(page.limit)
            .collect()
    }

    pub fn get_product(&self, id: &str) -> Result<Product, CoreError> {
        let id = parse_id(id)?;
        self.store
            .read()
            .find_by_id(&id)
            .cloned()
            .ok_or_else(CoreError::product_not_found)
    }

    pub fn create_product(&self, request: CreateProductRequest) -> Product {
        let product = Product::from_request(request);
        self.store.write().append(product.clone());
        info!(id = %product.id, category = %product.category, "product created");
        product
    }

    pub fn update_product(
        &self,
        id: &str,
        patch: UpdateProductRequest,
    ) -> Result<Product, CoreError> {
        let id = parse_id(id)?;
        let mut store = self.store.write();
        let mut product = store
            .find_by_id(&id)
            .cloned()
            .ok_or_else(CoreError::product_not_found)?;
        product.merge(patch);
        // 写锁在查找与替换之间一直持有，记录不会消失
        let replaced = store.replace(product.clone());
        debug_assert!(replaced, "product {} vanished under the write lock", id);
        debug!(id = %id, "product updated");
        Ok(product)
    }

    pub fn delete_product(&self, id: &str) -> Result<(), CoreError> {
        let id = parse_id(id)?;
        self.store
            .write()
            .remove(&id)
            .ok_or_else(CoreError::product_not_found)?;
        info!(id = %id, "product deleted");
        Ok(())
    }

    pub fn search_products(&self, name: &str) -> Vec<Product> {
        self.store.read().search_by_name(name)
    }

    pub fn category_stats(&self) -> BTreeMap<String, usize> {
        self.store.read().count_by_category()
    }

    pub fn count(&self) -> usize {
        self.store.read().len()
    }
}

/// 非 UUID 的 id 不可能存在于存储中，按未找到处理
fn parse_id(id: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(id).map_err(|_| CoreError::product_not_found())
}
