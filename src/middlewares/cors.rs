use actix_cors::Cors;

/// 只读接口允许任意来源；管理接口同样不依赖 Cookie 或凭据
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
