//! User-facing flash texts. The form is served in a single fixed locale.

pub const FILL_ALL_FIELDS: &str = "لطفا تمام فیلدها را پر کنید";
pub const NATIONAL_ID_INVALID: &str = "کد ملی باید 10 رقمی باشد";
pub const PHONE_INVALID: &str = "شماره تماس باید با 09 شروع شود و 11 رقمی باشد";
pub const CONFLICTING_IDENTITY: &str = "کد ملی و شماره تماس متعلق به دو ثبت‌نام متفاوت هستند";
pub const REGISTERED: &str = "ثبت نام شما با موفقیت انجام شد";
pub const DETAILS_UPDATED: &str = "اطلاعات شما با موفقیت به‌روزرسانی شد";
pub const NO_CODE_AVAILABLE: &str = "کد تخفیف در دسترس نیست";
pub const TRY_AGAIN: &str = "خطایی در ثبت اطلاعات رخ داد. لطفا مجددا تلاش کنید";

pub const CODE_ASSIGNED: &str = "کد تخفیف با موفقیت برای شما فعال شد";
pub const ALREADY_RECEIVED: &str = "شما قبلاً کد تخفیف دریافت کرده‌اید";
pub const POOL_EMPTY: &str = "متاسفانه کد تخفیفی موجود نیست";
pub const VISITOR_NOT_FOUND: &str = "کاربر مورد نظر یافت نشد";

pub const LOGIN_FIELDS_REQUIRED: &str = "لطفا نام کاربری و رمز عبور را وارد کنید";
pub const INVALID_CREDENTIALS: &str = "نام کاربری یا رمز عبور اشتباه است";
pub const LOGGED_OUT: &str = "با موفقیت خارج شدید";

pub const CODES_REQUIRED: &str = "لطفا کدهای تخفیف را وارد کنید";

pub fn codes_imported(added: u64, duplicates: u64) -> String {
    format!("{added} کد تخفیف جدید اضافه شد. {duplicates} کد تکراری بود.")
}
