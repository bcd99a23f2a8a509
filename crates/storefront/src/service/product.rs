//! Product catalog management, including the `addProduct` pricing rule.

use std::sync::Arc;

use common::protocol::{Page, PageQuery, ProductDto, ProductImageRequest, ProductRequest};
use common::ServiceError;
use tracing::info;

use crate::domain::catalog::special_price;
use crate::domain::Product;
use crate::repository::{
    CartRepository, CategoryRepository, Paging, ProductFilter, ProductRepository, ProductSort,
};

#[derive(Clone)]
pub struct ProductService {
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
    carts: Arc<dyn CartRepository>,
    paging: Paging,
    default_image: Arc<str>,
}

impl ProductService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        carts: Arc<dyn CartRepository>,
        paging: Paging,
        default_image: Arc<str>,
    ) -> Self {
        Self {
            categories,
            products,
            carts,
            paging,
            default_image,
        }
    }

    /// Create a product under `category_id`.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the category does not exist.
    /// - [`ServiceError::Api`] if the category already holds a product with
    ///   the same name.
    pub async fn add(&self, category_id: i64, req: ProductRequest) -> Result<ProductDto, ServiceError> {
        self.categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", "categoryId", category_id))?;

        let name = req.product_name.trim().to_owned();
        if self
            .products
            .find_in_category_by_name(category_id, name.clone())
            .await?
            .is_some()
        {
            return Err(ServiceError::api("Product already exist!!"));
        }

        let product = Product {
            id: 0,
            name,
            image: self.default_image.to_string(),
            description: req.description,
            quantity: req.quantity,
            price: req.price,
            discount: req.discount,
            special_price: special_price(req.price, req.discount),
            category_id,
        };
        let saved = self.products.insert(product).await?;
        info!(product_id = saved.id, category_id, "product created");
        Ok(ProductDto::from(&saved))
    }

    pub async fn list(&self, query: &PageQuery) -> Result<Page<ProductDto>, ServiceError> {
        self.list_filtered(ProductFilter::All, query).await
    }

    pub async fn list_by_category(
        &self,
        category_id: i64,
        query: &PageQuery,
    ) -> Result<Page<ProductDto>, ServiceError> {
        self.categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", "categoryId", category_id))?;
        self.list_filtered(ProductFilter::Category(category_id), query)
            .await
    }

    pub async fn search(&self, keyword: &str, query: &PageQuery) -> Result<Page<ProductDto>, ServiceError> {
        self.list_filtered(ProductFilter::Keyword(keyword.trim().to_owned()), query)
            .await
    }

    async fn list_filtered(
        &self,
        filter: ProductFilter,
        query: &PageQuery,
    ) -> Result<Page<ProductDto>, ServiceError> {
        let page = self.paging.resolve::<ProductSort>(query)?;
        Ok(self
            .products
            .list(filter, page)
            .await?
            .map(|p| ProductDto::from(&p)))
    }

    pub async fn get(&self, id: i64) -> Result<ProductDto, ServiceError> {
        Ok(ProductDto::from(&self.find(id).await?))
    }

    /// Replace a product's details and reprice it everywhere it sits in a cart.
    pub async fn update(&self, id: i64, req: ProductRequest) -> Result<ProductDto, ServiceError> {
        let mut product = self.find(id).await?;
        let name = req.product_name.trim().to_owned();

        if !product.name.eq_ignore_ascii_case(&name) {
            let clash = self
                .products
                .find_in_category_by_name(product.category_id, name.clone())
                .await?;
            if clash.is_some_and(|other| other.id != id) {
                return Err(ServiceError::api("Product already exist!!"));
            }
        }

        product.name = name;
        product.description = req.description;
        product.quantity = req.quantity;
        product.reprice(req.price, req.discount);

        let saved = self.products.update(product).await?;
        self.carts
            .reprice_product(saved.id, saved.special_price, saved.discount)
            .await?;
        Ok(ProductDto::from(&saved))
    }

    pub async fn update_image(
        &self,
        id: i64,
        req: ProductImageRequest,
    ) -> Result<ProductDto, ServiceError> {
        let mut product = self.find(id).await?;
        product.image = req.image.trim().to_owned();
        let saved = self.products.update(product).await?;
        Ok(ProductDto::from(&saved))
    }

    /// Delete a product and remove it from every cart.
    pub async fn delete(&self, id: i64) -> Result<ProductDto, ServiceError> {
        let product = self.find(id).await?;
        self.products.delete(id).await?;
        let carts = self.carts.purge_product(id).await?;
        info!(product_id = id, carts_updated = carts, "product deleted");
        Ok(ProductDto::from(&product))
    }

    async fn find(&self, id: i64) -> Result<Product, ServiceError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", "productId", id))
    }
}
