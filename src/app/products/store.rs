//! 产品内存存储
//!
//! 记录按 `id` 存放在 `HashMap` 中，另用一个 `Vec` 保存插入顺序，
//! 因此按 id 查找和替换是 O(1)，列表、过滤和搜索按插入顺序输出。
//! 存储本身不加锁，由 [`ProductService`](super::service::ProductService) 统一加锁。

use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use super::model::Product;

#[derive(Debug, Default)]
pub struct ProductStore {
    records: HashMap<Uuid, Product>,
    order: Vec<Uuid>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 按插入顺序遍历全部产品
    pub fn iter(&self) -> impl Iterator<Item = &Product> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// 返回全部产品，或 `category` 完全相等（区分大小写）的产品
    pub fn list(&self, category: Option<&str>) -> Vec<Product> {
        self.iter()
            .filter(|product| category.map_or(true, |c| product.category == c))
            .cloned()
            .collect()
    }

    pub fn find_by_id(&self, id: &Uuid) -> Option<&Product> {
        self.records.get(id)
    }

    /// 追加到末尾；id 已存在时替换原记录并保留其位置
    pub fn append(&mut self, product: Product) {
        let id = product.id;
        if self.records.insert(id, product).is_none() {
            self.order.push(id);
        }
    }

    /// 覆盖已存在的记录，位置不变。记录不存在时返回 `false`
    pub fn replace(&mut self, product: Product) -> bool {
        match self.records.get_mut(&product.id) {
            Some(slot) => {
                *slot = product;
                true
            }
            None => false,
        }
    }

    /// 删除记录，其余记录保持原有顺序
    pub fn remove(&mut self, id: &Uuid) -> Option<Product> {
        let product = self.records.remove(id)?;
        self.order.retain(|other| other != id);
        Some(product)
    }

    /// 名称子串匹配，不区分大小写
    pub fn search_by_name(&self, text: &str) -> Vec<Product> {
        let needle = text.to_lowercase();
        self.iter()
            .filter(|product| product.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// 每个分类的产品数量
    pub fn count_by_category(&self) -> BTreeMap<String, usize> {
        let mut stats = BTreeMap::new();
        for product in self.iter() {
            *stats.entry(product.category.clone()).or_insert(0) += 1;
        }
        stats
    }
}
