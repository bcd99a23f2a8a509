//! Category management.

use std::sync::Arc;

use common::protocol::{CategoryDto, CategoryRequest, Page, PageQuery};
use common::ServiceError;
use tracing::info;

use crate::domain::Category;
use crate::repository::{
    CartRepository, CategoryRepository, CategorySort, Paging, ProductRepository, StoreError,
};

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
    carts: Arc<dyn CartRepository>,
    paging: Paging,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        carts: Arc<dyn CartRepository>,
        paging: Paging,
    ) -> Self {
        Self {
            categories,
            products,
            carts,
            paging,
        }
    }

    pub async fn list(&self, query: &PageQuery) -> Result<Page<CategoryDto>, ServiceError> {
        let page = self.paging.resolve::<CategorySort>(query)?;
        Ok(self.categories.list(page).await?.map(|c| CategoryDto::from(&c)))
    }

    pub async fn create(&self, req: CategoryRequest) -> Result<CategoryDto, ServiceError> {
        let name = req.category_name.trim().to_owned();
        let saved = self
            .categories
            .insert(Category::new(name.clone()))
            .await
            .map_err(|e| duplicate_name(e, &name))?;
        info!(category_id = saved.id, "category created");
        Ok(CategoryDto::from(&saved))
    }

    pub async fn update(&self, id: i64, req: CategoryRequest) -> Result<CategoryDto, ServiceError> {
        let mut category = self.find(id).await?;
        category.name = req.category_name.trim().to_owned();
        let name = category.name.clone();
        let saved = self
            .categories
            .update(category)
            .await
            .map_err(|e| duplicate_name(e, &name))?;
        Ok(CategoryDto::from(&saved))
    }

    /// Delete a category together with its products, pulling those products
    /// out of every cart.
    pub async fn delete(&self, id: i64) -> Result<CategoryDto, ServiceError> {
        let category = self.find(id).await?;
        // Category goes first so no product can be added to it mid-cascade.
        self.categories.delete(id).await?;
        let products = self.products.delete_by_category(id).await?;
        for product in &products {
            self.carts.purge_product(product.id).await?;
        }
        info!(category_id = id, products_removed = products.len(), "category deleted");
        Ok(CategoryDto::from(&category))
    }

    async fn find(&self, id: i64) -> Result<Category, ServiceError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", "categoryId", id))
    }
}

fn duplicate_name(err: StoreError, name: &str) -> ServiceError {
    match err {
        StoreError::Duplicate { .. } => {
            ServiceError::api(format!("Category with the name {name} already exists !!!"))
        }
        other => other.into(),
    }
}
