use actix_web::{web, HttpRequest, HttpResponse};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::services::statistics;
use crate::state::app_state::AppState;

async fn get_statistics(
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let totals = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { statistics::by_source(txn).await.map_err(AppError::from) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(totals))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(super::resource("/statistics").route(web::get().to(get_statistics)));
}
