use actix_web::web;

mod auth;
mod attendance;
mod employee;
mod holiday;
mod payroll;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/auth")
            .configure(auth::config))
        .service(web::scope("/employee")
            .configure(employee::config))
        .service(web::scope("/attendance")
            .configure(attendance::config))
        .service(web::scope("/payroll")
            .configure(payroll::config))
        .service(web::scope("/holiday")
            .configure(holiday::config));
}
